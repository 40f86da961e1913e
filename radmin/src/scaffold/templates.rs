//! Embedded page templates
//!
//! Templates are minijinja sources rendered with auto-escaping disabled. JSX
//! object literals are always written with a space after the brace (`{ {`)
//! so they never read as template expressions.

use minijinja::{AutoEscape, Environment};

use crate::error::Result;

/// List page: reads `page` and `q` from the URL
pub const MODEL_LIST_PAGE: &str = r##"import { MetaTags } from '@redwoodjs/web'

import {{ model.pascal_plural }}Cell from './{{ model.pascal_plural }}Cell'

interface Props {
  page?: string
  q?: string
}

const {{ model.pascal_plural }}Page = ({ page, q }: Props) => {
  return (
    <>
      <MetaTags title="{{ model.humanized_plural }}" />

      <{{ model.pascal_plural }}Cell page={page ? parseInt(page, 10) : 1} q={q || ''} />
    </>
  )
}

export default {{ model.pascal_plural }}Page
"##;

/// List cell: paginated, searchable query
pub const MODEL_LIST_CELL: &str = r##"import type {
  FindRadmin{{ model.pascal_plural }},
  FindRadmin{{ model.pascal_plural }}Variables,
} from 'types/graphql'

import { routes } from '@redwoodjs/router'
import type { CellFailureProps, CellSuccessProps } from '@redwoodjs/web'

import Paginator from 'src/components/radmin/Paginator/Paginator'

import {{ model.pascal_plural }} from './{{ model.pascal_plural }}'

export const QUERY = gql`
  query FindRadmin{{ model.pascal_plural }}($page: Int, $q: String) {
    {{ model.camel }}Page(page: $page, q: $q) {
      {{ model.camel_plural }} {
{% for field in fields %}
        {{ field.name }}
{% endfor %}
      }
      count
    }
  }
`

export const beforeQuery = ({
  page,
  q,
}: FindRadmin{{ model.pascal_plural }}Variables) => ({
  variables: { page, q },
  fetchPolicy: 'cache-and-network',
})

export const Loading = () => <div className="radmin-loading">Loading...</div>

export const Failure = ({
  error,
}: CellFailureProps<FindRadmin{{ model.pascal_plural }}Variables>) => (
  <div className="rw-cell-error">{error?.message}</div>
)

export const Success = ({
  {{ model.camel }}Page,
  page,
  q,
}: CellSuccessProps<
  FindRadmin{{ model.pascal_plural }},
  FindRadmin{{ model.pascal_plural }}Variables
>) => {
  return (
    <>
      <{{ model.pascal_plural }}
        {{ model.camel_plural }}={ {{ model.camel }}Page.{{ model.camel_plural }} }
        q={q || ''}
      />
      <Paginator
        count={Number({{ model.camel }}Page.count)}
        page={page || 1}
        perPage={ {{ per_page }} }
        route={(page) => routes.radmin{{ model.pascal_plural }}({ page, q: q || undefined })}
      />
    </>
  )
}
"##;

/// List component: table, search form and delete action
pub const MODEL_LIST: &str = r##"import { useState } from 'react'

import type {
  DeleteRadmin{{ model.pascal }}ListMutationVariables,
  FindRadmin{{ model.pascal_plural }},
} from 'types/graphql'

import { Link, navigate, routes } from '@redwoodjs/router'
import { useMutation } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'

import { {{ list_formatters | join(", ") }} } from 'src/lib/radminFormatters'

import { QUERY } from './{{ model.pascal_plural }}Cell'

const DELETE_{{ model.capital }}_MUTATION = gql`
  mutation DeleteRadmin{{ model.pascal }}ListMutation($id: {{ id.graphql_type }}!) {
    delete{{ model.pascal }}({{ id.name }}: $id) {
      {{ id.name }}
    }
  }
`

interface Props {
  {{ model.camel_plural }}: FindRadmin{{ model.pascal_plural }}['{{ model.camel }}Page']['{{ model.camel_plural }}']
  q: string
}

const {{ model.pascal_plural }}List = ({ {{ model.camel_plural }}, q }: Props) => {
  const [search, setSearch] = useState(q)

  const [delete{{ model.pascal }}] = useMutation(DELETE_{{ model.capital }}_MUTATION, {
    onCompleted: () => {
      toast.success('{{ model.humanized }} deleted')
    },
    onError: (error) => {
      toast.error(error.message)
    },
    refetchQueries: [{ query: QUERY, variables: { q } }],
    awaitRefetchQueries: true,
  })

  const onDeleteClick = (id: DeleteRadmin{{ model.pascal }}ListMutationVariables['id']) => {
    if (confirm('Are you sure you want to delete {{ model.humanized | lower }} ' + id + '?')) {
      delete{{ model.pascal }}({ variables: { id } })
    }
  }

  const onSearch = (event: React.FormEvent<HTMLFormElement>) => {
    event.preventDefault()
    navigate(routes.radmin{{ model.pascal_plural }}({ q: search || undefined }))
  }

  return (
    <div className="radmin-panel">
      <header className="radmin-list-header">
        <h2>{{ model.humanized_plural }}</h2>
        <form className="radmin-search" onSubmit={onSearch}>
          <label htmlFor="radmin-search-{{ model.kebab }}" className="sr-only">
            Search {{ model.humanized_plural | lower }}
          </label>
          <input
            id="radmin-search-{{ model.kebab }}"
            type="search"
            value={search}
            placeholder="Search"
            onChange={(event) => setSearch(event.target.value)}
          />
          <button type="submit" className="radmin-button">
            Search
          </button>
        </form>
        <Link to={routes.radminNew{{ model.pascal }}()} className="radmin-button radmin-button-primary">
          New {{ model.humanized | lower }}
        </Link>
      </header>
      <div className="radmin-table-wrapper">
        <table className="radmin-table">
          <thead>
            <tr>
{% for field in fields %}
              <th>{{ field.display_name }}</th>
{% endfor %}
              <th>&nbsp;</th>
            </tr>
          </thead>
          <tbody>
            { {{ model.camel_plural }}.map(({{ model.camel }}) => (
              <tr key={ {{ model.camel }}.{{ id.name }} }>
{% for field in fields %}
                <td>{ {{ field.list_display_function }}({{ model.camel }}.{{ field.name }}) }</td>
{% endfor %}
                <td>
                  <nav className="radmin-table-actions">
                    <Link
                      to={routes.radmin{{ model.pascal }}({ id: {{ model.camel }}.{{ id.name }} })}
                      title={'Show {{ model.humanized | lower }} ' + {{ model.camel }}.{{ id.name }} + ' detail'}
                      className="radmin-button radmin-button-small"
                    >
                      Show
                    </Link>
                    <Link
                      to={routes.radminEdit{{ model.pascal }}({ id: {{ model.camel }}.{{ id.name }} })}
                      title={'Edit {{ model.humanized | lower }} ' + {{ model.camel }}.{{ id.name }} }
                      className="radmin-button radmin-button-small"
                    >
                      Edit
                    </Link>
                    <button
                      type="button"
                      title={'Delete {{ model.humanized | lower }} ' + {{ model.camel }}.{{ id.name }} }
                      className="radmin-button radmin-button-small radmin-button-danger"
                      onClick={() => onDeleteClick({{ model.camel }}.{{ id.name }})}
                    >
                      Delete
                    </button>
                  </nav>
                </td>
              </tr>
            ))}
          </tbody>
        </table>
      </div>
    </div>
  )
}

export default {{ model.pascal_plural }}List
"##;

/// Detail page
pub const MODEL_PAGE: &str = r##"import { MetaTags } from '@redwoodjs/web'

import {{ model.pascal }}Cell from './{{ model.pascal }}Cell'

type {{ model.pascal }}PageProps = {
  id: {{ id.ts_type }}
}

const {{ model.pascal }}Page = ({ id }: {{ model.pascal }}PageProps) => {
  return (
    <>
      <MetaTags title="{{ model.humanized }}" />

      <{{ model.pascal }}Cell id={id} />
    </>
  )
}

export default {{ model.pascal }}Page
"##;

/// Detail cell
pub const MODEL_CELL: &str = r##"import type {
  FindRadmin{{ model.pascal }}ById,
  FindRadmin{{ model.pascal }}ByIdVariables,
} from 'types/graphql'

import type { CellFailureProps, CellSuccessProps } from '@redwoodjs/web'

import {{ model.pascal }} from './{{ model.pascal }}'

export const QUERY = gql`
  query FindRadmin{{ model.pascal }}ById($id: {{ id.graphql_type }}!) {
    {{ model.camel }}: {{ model.camel }}({{ id.name }}: $id) {
{% for field in fields %}
      {{ field.name }}
{% endfor %}
    }
  }
`

export const Loading = () => <div className="radmin-loading">Loading...</div>

export const Empty = () => <div>{{ model.humanized }} not found</div>

export const Failure = ({
  error,
}: CellFailureProps<FindRadmin{{ model.pascal }}ByIdVariables>) => (
  <div className="rw-cell-error">{error?.message}</div>
)

export const Success = ({
  {{ model.camel }},
}: CellSuccessProps<FindRadmin{{ model.pascal }}ById, FindRadmin{{ model.pascal }}ByIdVariables>) => {
  return <{{ model.pascal }} {{ model.camel }}={ {{ model.camel }} } />
}
"##;

/// Detail component
pub const MODEL_COMPONENT: &str = r##"import type {
  DeleteRadmin{{ model.pascal }}MutationVariables,
  FindRadmin{{ model.pascal }}ById,
} from 'types/graphql'

import { Link, navigate, routes } from '@redwoodjs/router'
import { useMutation } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'
{% if display_formatters %}

import { {{ display_formatters | join(", ") }} } from 'src/lib/radminFormatters'
{% endif %}

const DELETE_{{ model.capital }}_MUTATION = gql`
  mutation DeleteRadmin{{ model.pascal }}Mutation($id: {{ id.graphql_type }}!) {
    delete{{ model.pascal }}({{ id.name }}: $id) {
      {{ id.name }}
    }
  }
`

interface Props {
  {{ model.camel }}: NonNullable<FindRadmin{{ model.pascal }}ById['{{ model.camel }}']>
}

const {{ model.pascal }} = ({ {{ model.camel }} }: Props) => {
  const [delete{{ model.pascal }}] = useMutation(DELETE_{{ model.capital }}_MUTATION, {
    onCompleted: () => {
      toast.success('{{ model.humanized }} deleted')
      navigate(routes.radmin{{ model.pascal_plural }}())
    },
    onError: (error) => {
      toast.error(error.message)
    },
  })

  const onDeleteClick = (id: DeleteRadmin{{ model.pascal }}MutationVariables['id']) => {
    if (confirm('Are you sure you want to delete {{ model.humanized | lower }} ' + id + '?')) {
      delete{{ model.pascal }}({ variables: { id } })
    }
  }

  return (
    <div className="radmin-panel">
      <header className="radmin-list-header">
        <h2>
          {{ model.humanized }} { {{ model.camel }}.{{ id.name }} }
        </h2>
      </header>
      <table className="radmin-table radmin-detail">
        <tbody>
{% for field in fields %}
          <tr>
            <th>{{ field.display_name }}</th>
{% if field.display_function %}
            <td>{ {{ field.display_function }}({{ model.camel }}.{{ field.name }}) }</td>
{% else %}
            <td>{ {{ model.camel }}.{{ field.name }} }</td>
{% endif %}
          </tr>
{% endfor %}
        </tbody>
      </table>
      <nav className="radmin-button-group">
        <Link
          to={routes.radminEdit{{ model.pascal }}({ id: {{ model.camel }}.{{ id.name }} })}
          className="radmin-button radmin-button-primary"
        >
          Edit
        </Link>
        <button
          type="button"
          className="radmin-button radmin-button-danger"
          onClick={() => onDeleteClick({{ model.camel }}.{{ id.name }})}
        >
          Delete
        </button>
      </nav>
    </div>
  )
}

export default {{ model.pascal }}
"##;

/// New page
pub const NEW_MODEL_PAGE: &str = r##"import { MetaTags } from '@redwoodjs/web'

import New{{ model.pascal }} from './New{{ model.pascal }}'

const New{{ model.pascal }}Page = () => {
  return (
    <>
      <MetaTags title="New {{ model.humanized | lower }}" />

      <New{{ model.pascal }} />
    </>
  )
}

export default New{{ model.pascal }}Page
"##;

/// New component: create mutation around the shared form
pub const NEW_MODEL_COMPONENT: &str = r##"import type { Create{{ model.pascal }}Input } from 'types/graphql'

import { navigate, routes } from '@redwoodjs/router'
import { useMutation } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'

import {{ model.pascal }}Form from 'src/components/radmin/{{ model.pascal }}/{{ model.pascal }}Form'

const CREATE_{{ model.capital }}_MUTATION = gql`
  mutation CreateRadmin{{ model.pascal }}Mutation($input: Create{{ model.pascal }}Input!) {
    create{{ model.pascal }}(input: $input) {
      {{ id.name }}
    }
  }
`

const New{{ model.pascal }} = () => {
  const [create{{ model.pascal }}, { loading, error }] = useMutation(
    CREATE_{{ model.capital }}_MUTATION,
    {
      onCompleted: () => {
        toast.success('{{ model.humanized }} created')
        navigate(routes.radmin{{ model.pascal_plural }}())
      },
      onError: (error) => {
        toast.error(error.message)
      },
    }
  )

  const onSave = (input: Create{{ model.pascal }}Input) => {
    create{{ model.pascal }}({ variables: { input } })
  }

  return (
    <div className="radmin-panel">
      <header className="radmin-list-header">
        <h2>New {{ model.humanized | lower }}</h2>
      </header>
      <{{ model.pascal }}Form onSave={onSave} loading={loading} error={error} />
    </div>
  )
}

export default New{{ model.pascal }}
"##;

/// Edit page
pub const EDIT_MODEL_PAGE: &str = r##"import { MetaTags } from '@redwoodjs/web'

import Edit{{ model.pascal }}Cell from './Edit{{ model.pascal }}Cell'

type Edit{{ model.pascal }}PageProps = {
  id: {{ id.ts_type }}
}

const Edit{{ model.pascal }}Page = ({ id }: Edit{{ model.pascal }}PageProps) => {
  return (
    <>
      <MetaTags title="Edit {{ model.humanized | lower }}" />

      <Edit{{ model.pascal }}Cell id={id} />
    </>
  )
}

export default Edit{{ model.pascal }}Page
"##;

/// Edit cell: loads the record and runs the update mutation
pub const EDIT_MODEL_CELL: &str = r##"import type {
  EditRadmin{{ model.pascal }}ById,
  Update{{ model.pascal }}Input,
} from 'types/graphql'

import { navigate, routes } from '@redwoodjs/router'
import type { CellFailureProps, CellSuccessProps } from '@redwoodjs/web'
import { useMutation } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'

import {{ model.pascal }}Form from 'src/components/radmin/{{ model.pascal }}/{{ model.pascal }}Form'

export const QUERY = gql`
  query EditRadmin{{ model.pascal }}ById($id: {{ id.graphql_type }}!) {
    {{ model.camel }}: {{ model.camel }}({{ id.name }}: $id) {
{% for field in fields %}
      {{ field.name }}
{% endfor %}
    }
  }
`

const UPDATE_{{ model.capital }}_MUTATION = gql`
  mutation UpdateRadmin{{ model.pascal }}Mutation($id: {{ id.graphql_type }}!, $input: Update{{ model.pascal }}Input!) {
    update{{ model.pascal }}({{ id.name }}: $id, input: $input) {
{% for field in fields %}
      {{ field.name }}
{% endfor %}
    }
  }
`

export const Loading = () => <div className="radmin-loading">Loading...</div>

export const Failure = ({ error }: CellFailureProps) => (
  <div className="rw-cell-error">{error?.message}</div>
)

export const Success = ({ {{ model.camel }} }: CellSuccessProps<EditRadmin{{ model.pascal }}ById>) => {
  const [update{{ model.pascal }}, { loading, error }] = useMutation(
    UPDATE_{{ model.capital }}_MUTATION,
    {
      onCompleted: () => {
        toast.success('{{ model.humanized }} updated')
        navigate(routes.radmin{{ model.pascal_plural }}())
      },
      onError: (error) => {
        toast.error(error.message)
      },
    }
  )

  const onSave = (
    input: Update{{ model.pascal }}Input,
    id: NonNullable<EditRadmin{{ model.pascal }}ById['{{ model.camel }}']>['{{ id.name }}']
  ) => {
    update{{ model.pascal }}({ variables: { id, input } })
  }

  return (
    <div className="radmin-panel">
      <header className="radmin-list-header">
        <h2>
          Edit {{ model.humanized | lower }} { {{ model.camel }}?.{{ id.name }} }
        </h2>
      </header>
      <{{ model.pascal }}Form {{ model.camel }}={ {{ model.camel }} } onSave={onSave} error={error} loading={loading} />
    </div>
  )
}
"##;

/// Shared create/edit form, one input per form field
pub const MODEL_FORM: &str = r##"import type { EditRadmin{{ model.pascal }}ById, Update{{ model.pascal }}Input } from 'types/graphql'

import {
  Form,
  FormError,
  FieldError,
  Label,
{% for component in form_components %}
  {{ component }},
{% endfor %}
  Submit,
  useForm,
} from '@redwoodjs/forms'
import type { RWGqlError } from '@redwoodjs/forms'
{% if uses_wysiwyg %}

import WysiwygEditor from 'src/components/radmin/WysiwygEditor/WysiwygEditor'
{% endif %}
{% if form_formatters %}

import { {{ form_formatters | join(", ") }} } from 'src/lib/radminFormatters'
{% endif %}

type Form{{ model.pascal }} = NonNullable<EditRadmin{{ model.pascal }}ById['{{ model.camel }}']>

interface {{ model.pascal }}FormProps {
  {{ model.camel }}?: EditRadmin{{ model.pascal }}ById['{{ model.camel }}']
  onSave: (data: Update{{ model.pascal }}Input, id?: Form{{ model.pascal }}['{{ id.name }}']) => void
  error: RWGqlError
  loading: boolean
}

const {{ model.pascal }}Form = (props: {{ model.pascal }}FormProps) => {
  const formMethods = useForm<Form{{ model.pascal }}>()

  const onSubmit = (data: Form{{ model.pascal }}) => {
    props.onSave(data, props?.{{ model.camel }}?.{{ id.name }})
  }

  return (
    <div className="rw-form-wrapper">
      <Form<Form{{ model.pascal }}> onSubmit={onSubmit} error={props.error} formMethods={formMethods}>
        <FormError
          error={props.error}
          wrapperClassName="rw-form-error-wrapper"
          titleClassName="rw-form-error-title"
          listClassName="rw-form-error-list"
        />
{% for field in form_fields %}

        <Label
          name="{{ field.name }}"
          className="rw-label"
          errorClassName="rw-label rw-label-error"
        >
          {{ field.display_name }}
        </Label>
{% if field.description_literal %}
        <p className="radmin-field-description">{ {{ field.description_literal }} }</p>
{% endif %}
{% if field.widget == "WysiwygEditor" %}
        <HiddenField
          name="{{ field.name }}"
          defaultValue={props.{{ model.camel }}?.{{ field.name }}{% if field.default_value != "undefined" %} ?? {{ field.default_value }}{% endif %}}
{% if field.validation %}
          validation={{ field.validation }}
{% endif %}
{% if field.empty_as %}
          {{ field.empty_as }}
{% endif %}
        />
        <WysiwygEditor
          defaultValue={props.{{ model.camel }}?.{{ field.name }} ?? {% if field.default_value != "undefined" %}{{ field.default_value }}{% else %}''{% endif %}}
          className="rw-input"
{% if field.set_value %}
          {{ field.set_value }}
{% endif %}
        />
{% elif field.sub_data and field.widget == "SelectField" %}
        <SelectField
          name="{{ field.name }}"
          defaultValue={props.{{ model.camel }}?.{{ field.name }}{% if field.default_value != "undefined" %} ?? {{ field.default_value }}{% endif %}}
          className="rw-input"
          errorClassName="rw-input rw-input-error"
{% if field.validation %}
          validation={{ field.validation }}
{% endif %}
{% if field.empty_as %}
          {{ field.empty_as }}
{% endif %}
        >
{% for option in field.sub_data %}
          <option value="{{ option.value }}">{{ option.display_name }}</option>
{% endfor %}
        </SelectField>
{% elif field.sub_data %}
        <div className="rw-check-radio-items">
{% for option in field.sub_data %}
          <div className="rw-check-radio-item">
            <{{ field.widget }}
              id="{{ model.kebab }}-{{ field.name }}-{{ loop.index0 }}"
              name="{{ field.name }}"
              value="{{ option.value }}"
{% if field.widget == "RadioField" %}
{% if field.default_value != "undefined" %}
              defaultChecked={(props.{{ model.camel }}?.{{ field.name }} ?? {{ field.default_value }}) === '{{ option.value }}'}
{% else %}
              defaultChecked={props.{{ model.camel }}?.{{ field.name }} === '{{ option.value }}'}
{% endif %}
{% else %}
              defaultChecked={props.{{ model.camel }}?.{{ field.name }}?.includes('{{ option.value }}')}
{% endif %}
              className="rw-input"
              errorClassName="rw-input rw-input-error"
            />
            <label htmlFor="{{ model.kebab }}-{{ field.name }}-{{ loop.index0 }}">{{ option.display_name }}</label>
          </div>
{% endfor %}
        </div>
{% else %}
        <{{ field.widget }}
          name="{{ field.name }}"
{% if field.deserialize_function %}
          {{ field.default_prop }}={ {{ field.deserialize_function }}(props.{{ model.camel }}?.{{ field.name }}) }
{% else %}
          {{ field.default_prop }}={props.{{ model.camel }}?.{{ field.name }}{% if field.default_value != "undefined" %} ?? {{ field.default_value }}{% endif %}}
{% endif %}
          className="rw-input"
          errorClassName="rw-input rw-input-error"
{% if field.validation %}
          validation={{ field.validation }}
{% endif %}
{% if field.empty_as %}
          {{ field.empty_as }}
{% endif %}
        />
{% endif %}

        <FieldError name="{{ field.name }}" className="rw-field-error" />
{% endfor %}

        <div className="radmin-button-group">
          <Submit disabled={props.loading} className="radmin-button radmin-button-primary">
            Save
          </Submit>
        </div>
      </Form>
    </div>
  )
}

export default {{ model.pascal }}Form
"##;

/// Navigation layout wrapping every admin route
pub const LAYOUT: &str = r##"import { Link, routes } from '@redwoodjs/router'
import { Toaster } from '@redwoodjs/web/toast'

import { useAuth } from 'src/auth'

const toastOptions = { className: 'rw-toast', duration: 6000 }

type RadminLayoutProps = {
  children?: React.ReactNode
}

const RadminLayout = ({ children }: RadminLayoutProps) => {
  const { isAuthenticated, logOut } = useAuth()

  return (
    <div className="radmin">
      <Toaster toastOptions={toastOptions} />
      <header className="radmin-header">
        <h1>
          <Link to={routes.radmin()}>{{ app_title }}</Link>
        </h1>
        {isAuthenticated && (
          <button type="button" className="radmin-button" onClick={logOut}>
            Log out
          </button>
        )}
      </header>
      <div className="radmin-body">
        {isAuthenticated && (
          <nav className="radmin-nav">
            <ul>
{% for model in models %}
              <li>
                <Link to={routes.radmin{{ model.pascal_plural }}()}>{{ model.humanized_plural }}</Link>
              </li>
{% endfor %}
            </ul>
          </nav>
        )}
        <main className="radmin-main">{children}</main>
      </div>
    </div>
  )
}

export default RadminLayout
"##;

/// Dashboard listing every model
pub const RADMIN_PAGE: &str = r##"import { Link, routes } from '@redwoodjs/router'
import { MetaTags } from '@redwoodjs/web'

const RadminPage = () => {
  return (
    <>
      <MetaTags title="{{ app_title }}" />

      <div className="radmin-panel">
        <header className="radmin-list-header">
          <h2>{{ app_title }}</h2>
        </header>
        <ul className="radmin-dashboard">
{% for model in models %}
          <li>
            <Link to={routes.radmin{{ model.pascal_plural }}()}>{{ model.humanized_plural }}</Link>
          </li>
{% endfor %}
        </ul>
      </div>
    </>
  )
}

export default RadminPage
"##;

/// dbAuth login page
pub const RADMIN_LOGIN_PAGE: &str = r##"import { useEffect, useRef } from 'react'

import {
  FieldError,
  Form,
  Label,
  PasswordField,
  Submit,
  TextField,
} from '@redwoodjs/forms'
import { Link, navigate, routes } from '@redwoodjs/router'
import { MetaTags } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'

import { useAuth } from 'src/auth'

const required = { required: true }

const RadminLoginPage = () => {
  const { isAuthenticated, logIn } = useAuth()
  const emailRef = useRef<HTMLInputElement>(null)

  useEffect(() => {
    if (isAuthenticated) {
      navigate(routes.radmin())
    }
  }, [isAuthenticated])

  useEffect(() => {
    emailRef.current?.focus()
  }, [])

  const onSubmit = async (data: Record<string, string>) => {
    const response = await logIn({
      username: data.email,
      password: data.password,
    })

    if (response.error) {
      toast.error(response.error)
    } else {
      toast.success('Welcome back!')
    }
  }

  return (
    <>
      <MetaTags title="Log in" />

      <div className="radmin-panel radmin-auth">
        <header className="radmin-list-header">
          <h2>Log in to {{ app_title }}</h2>
        </header>
        <Form onSubmit={onSubmit} className="rw-form-wrapper">
          <Label name="email" className="rw-label" errorClassName="rw-label rw-label-error">
            Email
          </Label>
          <TextField
            name="email"
            ref={emailRef}
            className="rw-input"
            errorClassName="rw-input rw-input-error"
            validation={required}
          />
          <FieldError name="email" className="rw-field-error" />

          <Label name="password" className="rw-label" errorClassName="rw-label rw-label-error">
            Password
          </Label>
          <PasswordField
            name="password"
            autoComplete="current-password"
            className="rw-input"
            errorClassName="rw-input rw-input-error"
            validation={required}
          />
          <FieldError name="password" className="rw-field-error" />

          <div className="radmin-button-group">
            <Submit className="radmin-button radmin-button-primary">Log in</Submit>
          </div>
        </Form>
        <p className="radmin-auth-switch">
          No account yet? <Link to={routes.radminSignup()}>Sign up</Link>
        </p>
      </div>
    </>
  )
}

export default RadminLoginPage
"##;

/// dbAuth signup page; new accounts wait for approval
pub const RADMIN_SIGNUP_PAGE: &str = r##"import { useEffect, useRef, useState } from 'react'

import {
  FieldError,
  Form,
  Label,
  PasswordField,
  Submit,
  TextField,
} from '@redwoodjs/forms'
import { Link, navigate, routes } from '@redwoodjs/router'
import { MetaTags } from '@redwoodjs/web'
import { toast } from '@redwoodjs/web/toast'

import { useAuth } from 'src/auth'

const required = { required: true }

const RadminSignupPage = () => {
  const { isAuthenticated, signUp } = useAuth()
  const [submitted, setSubmitted] = useState(false)
  const emailRef = useRef<HTMLInputElement>(null)

  useEffect(() => {
    if (isAuthenticated) {
      navigate(routes.radmin())
    }
  }, [isAuthenticated])

  useEffect(() => {
    emailRef.current?.focus()
  }, [])

  const onSubmit = async (data: Record<string, string>) => {
    const response = await signUp({
      username: data.email,
      password: data.password,
    })

    if (response.error) {
      toast.error(response.error)
    } else {
      setSubmitted(true)
    }
  }

  if (submitted) {
    return (
      <div className="radmin-panel radmin-auth">
        <p>
          Thanks for signing up. An administrator has to approve your account
          before you can log in.
        </p>
        <Link to={routes.radminLogin()}>Back to log in</Link>
      </div>
    )
  }

  return (
    <>
      <MetaTags title="Sign up" />

      <div className="radmin-panel radmin-auth">
        <header className="radmin-list-header">
          <h2>Sign up for {{ app_title }}</h2>
        </header>
        <Form onSubmit={onSubmit} className="rw-form-wrapper">
          <Label name="email" className="rw-label" errorClassName="rw-label rw-label-error">
            Email
          </Label>
          <TextField
            name="email"
            ref={emailRef}
            className="rw-input"
            errorClassName="rw-input rw-input-error"
            validation={required}
          />
          <FieldError name="email" className="rw-field-error" />

          <Label name="password" className="rw-label" errorClassName="rw-label rw-label-error">
            Password
          </Label>
          <PasswordField
            name="password"
            autoComplete="new-password"
            className="rw-input"
            errorClassName="rw-input rw-input-error"
            validation={required}
          />
          <FieldError name="password" className="rw-field-error" />

          <div className="radmin-button-group">
            <Submit className="radmin-button radmin-button-primary">Sign up</Submit>
          </div>
        </Form>
        <p className="radmin-auth-switch">
          Already have an account? <Link to={routes.radminLogin()}>Log in</Link>
        </p>
      </div>
    </>
  )
}

export default RadminSignupPage
"##;

/// SDL: page type and paginated query, replacing the `type Query {` line
pub const SDL_PAGE_QUERY: &str = r##"  type {{ model.pascal }}Page {
    {{ model.camel_plural }}: [{{ model.pascal }}!]!
    count: BigInt!
  }

  type Query {
    {{ model.camel }}Page(page: Int, q: String): {{ model.pascal }}Page @requireAuth
"##;

/// Service: paginated, searchable query, inserted after the `db` import
pub const SERVICE_PAGE: &str = r##"
const {{ model.capital_plural }}_PER_PAGE = {{ per_page }}

interface {{ model.pascal }}PageArgs {
  page?: number
  q?: string
}

const count{{ model.pascal_plural }}Raw = async (q: string) => {
  const result = await db.$queryRaw<{ count: bigint }[]>`
    SELECT COUNT(*) AS count
    FROM "{{ model.name }}"
    WHERE "{{ search_field }}"::text ILIKE ${'%' + q + '%'}
  `

  return result[0]?.count ?? 0
}

export const {{ model.camel }}Page = async ({ page = 1, q }: {{ model.pascal }}PageArgs) => {
  const offset = (page - 1) * {{ model.capital_plural }}_PER_PAGE

  if (q) {
    const {{ model.camel_plural }} = await db.$queryRaw`
      SELECT *
      FROM "{{ model.name }}"
      WHERE "{{ search_field }}"::text ILIKE ${'%' + q + '%'}
{% if order_by %}
      ORDER BY "{{ order_by }}" DESC
{% endif %}
      LIMIT ${ {{ model.capital_plural }}_PER_PAGE }
      OFFSET ${offset}
    `

    return { {{ model.camel_plural }}, count: await count{{ model.pascal_plural }}Raw(q) }
  }

  const [{{ model.camel_plural }}, count] = await Promise.all([
    db.{{ model.camel }}.findMany({
      take: {{ model.capital_plural }}_PER_PAGE,
      skip: offset,
{% if order_by %}
      orderBy: { {{ order_by }}: 'desc' },
{% endif %}
    }),
    db.{{ model.camel }}.count(),
  ])

  return { {{ model.camel_plural }}, count }
}
"##;

/// Every template with the name it is registered under
const TEMPLATES: &[(&str, &str)] = &[
    ("model_list_page", MODEL_LIST_PAGE),
    ("model_list_cell", MODEL_LIST_CELL),
    ("model_list", MODEL_LIST),
    ("model_page", MODEL_PAGE),
    ("model_cell", MODEL_CELL),
    ("model_component", MODEL_COMPONENT),
    ("new_model_page", NEW_MODEL_PAGE),
    ("new_model_component", NEW_MODEL_COMPONENT),
    ("edit_model_page", EDIT_MODEL_PAGE),
    ("edit_model_cell", EDIT_MODEL_CELL),
    ("model_form", MODEL_FORM),
    ("layout", LAYOUT),
    ("radmin_page", RADMIN_PAGE),
    ("radmin_login_page", RADMIN_LOGIN_PAGE),
    ("radmin_signup_page", RADMIN_SIGNUP_PAGE),
    ("sdl_page_query", SDL_PAGE_QUERY),
    ("service_page", SERVICE_PAGE),
];

/// Compiled templates, looked up by name
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Compile all embedded templates
    ///
    /// # Errors
    ///
    /// Returns a template error if an embedded template has a syntax error.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();

        // Generating code, not HTML
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }

        Ok(Self { env })
    }

    /// Render the template registered as `name`
    ///
    /// # Errors
    ///
    /// Returns a template error if the template does not exist or the
    /// context is missing a value it needs.
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.get_template(name)?.render(context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_compile() {
        assert!(TemplateRegistry::new().is_ok());
    }

    #[test]
    fn test_unknown_template_is_error() {
        let registry = TemplateRegistry::new().unwrap();
        assert!(registry.render("missing", &json!({})).is_err());
    }

    #[test]
    fn test_jsx_braces_survive_rendering() {
        let registry = TemplateRegistry::new().unwrap();
        let out = registry
            .render(
                "model_page",
                &json!({
                    "model": { "pascal": "Post", "humanized": "Post" },
                    "id": { "ts_type": "number" },
                }),
            )
            .unwrap();
        assert!(out.contains("const PostPage = ({ id }: PostPageProps) => {"));
        assert!(out.contains("<PostCell id={id} />"));
    }

    #[test]
    fn test_layout_lists_models() {
        let registry = TemplateRegistry::new().unwrap();
        let out = registry
            .render(
                "layout",
                &json!({
                    "app_title": "Store",
                    "models": [
                        { "pascal_plural": "Posts", "humanized_plural": "Posts" },
                        { "pascal_plural": "StoreUsers", "humanized_plural": "Store users" },
                    ],
                }),
            )
            .unwrap();
        assert!(out.contains("<Link to={routes.radminPosts()}>Posts</Link>"));
        assert!(out.contains("<Link to={routes.radminStoreUsers()}>Store users</Link>"));
        assert!(!out.contains("{%"));
    }
}
